//! Convert raw image pixels into an accessibility-aware 16-color terminal
//! palette plus background, foreground, cursor and selection roles.
//!
//! The crate is the analysis core only: callers hand in an array of RGB
//! pixel colors (integer or normalized float channels) and a [`Config`], and
//! get back a [`Palette`] mapping all 22 theme roles to colors in HSL, RGB
//! and hex form. Decoding images and writing theme files are left to
//! external collaborators.
//!
//! ```no_run
//! use tinct::{generate, Config};
//!
//! let pixels: Vec<[u8; 3]> = vec![[30, 30, 46]; 1024];
//! let palette = generate(&pixels, &Config::default())?;
//! for (role, color) in palette.iter() {
//!     println!("{} = {}", role.name(), color.hex);
//! }
//! # Ok::<(), tinct::Error>(())
//! ```
//!
//! Output is deterministic for a fixed input and [`Config::kmeans_seed`];
//! changing the seed re-rolls the clustering initialization.

pub mod color;
pub mod config;
pub mod error;
pub mod pipeline;

pub use color::Hsl;
pub use config::{BackgroundMode, Config};
pub use error::Error;
pub use pipeline::assign::{Palette, Role, RoleColor};
pub use pipeline::{generate, generate_f32};
