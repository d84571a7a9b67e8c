//! egui panels for the component playground.
//!
//! Panels render from [`state::UiState`] and report user intent back to the
//! app as small action values; they never touch the session directly.

pub mod panels;
pub mod state;
pub mod theme;

#[cfg(test)]
mod tests;
