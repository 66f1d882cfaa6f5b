mod chooser;

pub use chooser::{ChooserAction, ChooserState, draw_chooser, run_chooser};
