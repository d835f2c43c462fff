//! Real-world scenario benchmarks.
//!
//! These model what the app actually does per frame: render the voice while
//! a note's envelope runs, advance the draw loop, or bounce a whole song.

mod bounce;
mod draw;
mod voice;

pub use bounce::bench_bounce;
pub use draw::bench_draw;
pub use voice::bench_voice;
