//! Tests for the cleaning operations
//!
//! Shared fixtures live here; each operation has its own test module.

pub mod outliers_tests;

use crate::frame::{DataFormat, Frame};

/// Build a frame from inline CSV text
pub fn frame_from_csv(text: &str) -> Frame {
    Frame::load(text.as_bytes(), DataFormat::Csv).unwrap()
}

/// Values of a numeric column as floats
pub fn column_values(frame: &Frame, column: &str) -> Vec<Option<f64>> {
    frame.numeric_values(column).unwrap()
}

/// Frame with a single outlier in both numeric columns, on the same row
pub fn create_sales_frame() -> Frame {
    frame_from_csv(
        "region,units,revenue\n\
         north,1,10\n\
         south,2,20\n\
         east,3,30\n\
         west,4,40\n\
         north,5,50\n\
         south,100,1000\n",
    )
}
