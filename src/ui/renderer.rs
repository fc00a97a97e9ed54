//! Top-level rendering coordinator.
//!
//! Rendering is two steps: compute the
//! [`UIViewModel`](crate::ui::viewmodel::UIViewModel) from the state, then
//! hand it to the components. Output goes to stdout as ANSI sequences; the
//! host clears the pane before each render.

use crate::app::AppState;
use crate::ui::components;

/// Renders the plugin UI for a pane of `rows` x `cols`.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    let viewmodel = state.compute_viewmodel(rows, cols);
    components::render_layout(&viewmodel, &state.theme, cols, rows);
}
