//! # gifatlas
//!
//! Turn animated GIFs into tiled texture atlases for in-world playback,
//! together with the LSL script that animates them.
//!
//! `gifatlas` decodes an animation into a [`FrameSequence`], lays its frames
//! out on a square-ish grid, runs every tile through a configurable effect
//! pipeline, and writes the sheet under a name that encodes the grid and
//! playback speed (`anim;4;3;10;0.png`). The emitted script reads those
//! numbers back from the texture name at runtime.
//!
//! ## Quick Start
//!
//! ### Build an Atlas
//!
//! ```no_run
//! use gifatlas::{AtlasOptions, FrameSequence, RasterFormat};
//!
//! let frames = FrameSequence::open("dance.gif").unwrap();
//! let atlas = gifatlas::compose(&frames, &AtlasOptions::new()).unwrap();
//! let path = gifatlas::export::save_atlas(
//!     &atlas,
//!     ".",
//!     frames.base_name(),
//!     gifatlas::naming::DEFAULT_SPEED,
//!     RasterFormat::Png,
//! )
//! .unwrap();
//! println!("saved {}", path.display());
//! ```
//!
//! ### Emit the Script
//!
//! ```no_run
//! use gifatlas::{FrameSequence, script};
//!
//! let frames = FrameSequence::open("dance.gif").unwrap();
//! let text = script::emit_for_frames(&frames, 10.0).unwrap();
//! script::write_script("dance.lsl", &text).unwrap();
//! ```
//!
//! ### Tile Effects
//!
//! ```no_run
//! use gifatlas::{AtlasOptions, EffectParameters, FrameSequence};
//!
//! let frames = FrameSequence::open("dance.gif").unwrap();
//! let effects = EffectParameters::new()
//!     .with_sharpen(2.5)
//!     .with_color_intensity(0.8);
//! let options = AtlasOptions::new()
//!     .with_canvas_size(1024, 1024)
//!     .with_borderless(true)
//!     .with_effects(effects);
//! let atlas = gifatlas::compose(&frames, &options).unwrap();
//! ```
//!
//! ## Features
//!
//! - **Grid layout**: `ceil(sqrt(n))` columns, `ceil(n / columns)` rows
//! - **Effect pipeline**: grayscale, sharpen, blur, transparency, and color
//!   intensity, applied in a fixed order
//! - **Border trimming**: crop fully transparent margins
//! - **Texture naming**: grid and speed encoded into the file name
//! - **Script emission**: LSL texture animation script
//! - **Raster export**: PNG, JPEG (alpha flattened), BMP
//! - **Frame management**: duplicate, truncate, capacity-checked append
//! - **Progress**: per-tile progress callbacks
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rayon` | Render tiles in parallel on the rayon thread pool |
//! | `gif` | Animated GIF export with effects |
//! | `full` | Enables all of the above |

pub mod compose;
pub mod config;
pub mod effects;
pub mod error;
pub mod export;
pub mod frames;
#[cfg(feature = "gif")]
pub mod gif;
pub mod layout;
pub mod naming;
pub mod progress;
#[cfg(feature = "rayon")]
mod rayon;
pub mod script;

pub use compose::{Atlas, compose, opaque_bounds, render_preview};
pub use config::{AtlasOptions, DEFAULT_CANVAS_SIZE, TRANSPARENT};
pub use effects::{EffectParameters, EffectProfiles};
pub use error::AtlasError;
pub use export::RasterFormat;
pub use frames::FrameSequence;
#[cfg(feature = "gif")]
pub use gif::GifOptions;
pub use layout::{GridSpec, compute_grid, compute_tile_size};
pub use naming::{AnimationMetadata, build_name};
pub use progress::{OperationType, ProgressCallback, ProgressInfo};
pub use script::ScriptFormat;
