//! Screen implementations for the app state machine.

mod game;
mod leaderboard;
mod menu;
mod profile;
mod sign_in;
mod sign_up;

pub use game::GameScreen;
pub use leaderboard::LeaderboardScreen;
pub use menu::MenuScreen;
pub use profile::ProfileScreen;
pub use sign_in::SignInScreen;
pub use sign_up::SignUpScreen;
