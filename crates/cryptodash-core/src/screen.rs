//! Rendering seam.

use crate::{layout::Dimensions, view::View, Result};

/// A fixed-width character grid the engine draws onto.
///
/// Implementations own the terminal backend. The engine calls [`size`]
/// whenever a resize notification arrives and [`draw`] after every accepted
/// mutation; nothing else touches the terminal.
///
/// [`size`]: Screen::size
/// [`draw`]: Screen::draw
pub trait Screen: Send {
    /// Current terminal dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot report its size.
    fn size(&mut self) -> Result<Dimensions>;

    /// Draw one complete frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write the frame.
    fn draw(&mut self, view: &View) -> Result<()>;
}
