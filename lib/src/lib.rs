// BEGIN - Embark standard lints v0.4
// do not change or add/remove here, but one can add exceptions after this section
// for more info see: <https://github.com/EmbarkStudios/rust-ecosystem/issues/59>
#![deny(unsafe_code)]
#![warn(
    clippy::all,
    clippy::await_holding_lock,
    clippy::char_lit_as_u8,
    clippy::checked_conversions,
    clippy::dbg_macro,
    clippy::debug_assert_with_mut_call,
    clippy::doc_markdown,
    clippy::empty_enum,
    clippy::enum_glob_use,
    clippy::exit,
    clippy::expl_impl_clone_on_copy,
    clippy::explicit_deref_methods,
    clippy::explicit_into_iter_loop,
    clippy::fallible_impl_from,
    clippy::filter_map_next,
    clippy::float_cmp_const,
    clippy::fn_params_excessive_bools,
    clippy::if_let_mutex,
    clippy::implicit_clone,
    clippy::imprecise_flops,
    clippy::inefficient_to_string,
    clippy::invalid_upcast_comparisons,
    clippy::large_types_passed_by_value,
    clippy::let_unit_value,
    clippy::linkedlist,
    clippy::lossy_float_literal,
    clippy::macro_use_imports,
    clippy::manual_ok_or,
    clippy::map_err_ignore,
    clippy::map_flatten,
    clippy::map_unwrap_or,
    clippy::match_on_vec_items,
    clippy::match_same_arms,
    clippy::match_wildcard_for_single_variants,
    clippy::mem_forget,
    clippy::mismatched_target_os,
    clippy::mut_mut,
    clippy::mutex_integer,
    clippy::needless_borrow,
    clippy::needless_continue,
    clippy::option_option,
    clippy::path_buf_push_overwrite,
    clippy::ptr_as_ptr,
    clippy::ref_option_ref,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::same_functions_in_if_condition,
    clippy::semicolon_if_nothing_returned,
    clippy::string_add_assign,
    clippy::string_add,
    clippy::string_lit_as_bytes,
    clippy::string_to_string,
    clippy::todo,
    clippy::trait_duplication_in_bounds,
    clippy::unimplemented,
    clippy::unnested_or_patterns,
    clippy::unused_self,
    clippy::useless_transmute,
    clippy::verbose_file_reads,
    clippy::zero_sized_map_values,
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms
)]
// END - Embark standard lints v0.4

//! `resynthesizer` fills a selected area of an image with texture copied from
//! its surroundings, also known as content aware fill or inpainting.
//!
//! The selected pixels are visited in an order picked from the fill direction
//! and sampling shape. For each one, candidate locations in the sampled area
//! are compared through the already filled neighborhood of the pixel, and the
//! best matching source pixel is copied over. Several refinement passes are
//! run until the result stops changing much.
//!
//! A `Session` is built via a `SessionBuilder`, which follows the builder
//! pattern. Calling `build` loads the image and checks the selection.
//! `Session::run()` fills a copy of the image on a worker thread and returns
//! a `FilledImage`, which can be saved, streamed or inspected. `FillWorker`
//! keeps a session on a background thread for hosts that change parameters
//! while a fill is running.
//!
//! ## Usage
//!
//! ```no_run
//! use resynthesizer::{geometry::Rect, CancelToken, FillDirection, RunOutcome, Selection};
//!
//! // Select a 20x10 area to fill
//! let selection = Selection::from_rects(vec![Rect::new(40, 40, 20, 10)]);
//!
//! let mut session = resynthesizer::Session::builder()
//!     // Sample from the 30 pixels around the selection
//!     .sample_size(30)
//!     .fill_direction(FillDirection::InwardToCenter)
//!     .seed(10)
//!     .build(&"imgs/beach.jpg", selection)
//!     .expect("failed to build session");
//!
//! match session.run(None, &CancelToken::new()).expect("failed to fill") {
//!     RunOutcome::Filled(filled) => filled.save("filled.png").expect("failed to save image"),
//!     RunOutcome::Canceled => {}
//! }
//! ```
pub mod comparers;
pub mod context;
mod errors;
pub mod geometry;
pub mod point_array;
mod progress;
pub mod resynthesizer;
pub mod selection;
pub mod session;
pub mod sorter;
mod utils;
pub mod worker;

pub use image;

pub use context::{FillDirection, MatchContext, SampleFrom};
pub use errors::{Error, InvalidParameter, SizeMismatch};
pub use progress::{CancelToken, FillProgress, ProgressStat};
pub use resynthesizer::{EngineState, FillOutcome, Resynthesizer};
pub use selection::{render_mask, Selection};
pub use session::{FilledImage, Parameters, RunOutcome, Session, SessionBuilder};
pub use utils::{load_dynamic_image, load_image, load_mask, ImageSource};
pub use worker::{FillWorker, RunId, WorkerEvent};
