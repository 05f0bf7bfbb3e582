//! Identity, credential persistence and form validation.

mod context;
mod debounce;
mod store;
mod validation;

pub use context::AuthContext;
pub use debounce::{FeedbackDebounce, SIGN_IN_FEEDBACK_DELAY, SIGN_UP_FEEDBACK_DELAY};
pub use store::{CredentialStore, StoreError};
pub use validation::{
    MIN_PASSWORD_LENGTH, PasswordChecks, SPECIAL_CHARACTERS, SignInForm, SignUpForm,
    is_valid_email,
};
