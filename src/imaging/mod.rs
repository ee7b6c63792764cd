pub mod normalizer;

pub use normalizer::{
    proportional_height, resize_for_display, resize_path_for_display, resize_reader_for_display,
    ImageNormalizer, MAX_PREVIEW_HEIGHT,
};
