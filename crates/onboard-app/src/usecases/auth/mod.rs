//! Authentication use cases: sign in, sign up, sign out.

pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

pub use sign_in::{SignIn, SignInError};
pub use sign_out::SignOut;
pub use sign_up::{SignUp, SignUpError};
