//! User-facing message strings shared across use cases.

/// Sign-in rejection, shown as a dialog.
pub const MSG_INCORRECT_CREDENTIALS: &str = "Incorrect email or password";

/// Inline username-step error, also used for claim conflicts.
pub const MSG_USERNAME_TAKEN: &str = "Username is already taken";

/// Sign-up conflict dialog.
pub const MSG_ACCOUNT_EXISTS: &str = "An account with that email already exists";

/// Generic remote-failure dialog.
pub const MSG_TRY_AGAIN: &str = "Something went wrong. Please try again later.";

/// Picture-step dialog when the selected file cannot be read.
pub const MSG_UNREADABLE_IMAGE: &str = "That image could not be read. Please pick another file.";
