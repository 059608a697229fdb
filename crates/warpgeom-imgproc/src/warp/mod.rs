//! Image geometric transformations driven by planar homographies.

mod homography;

pub use homography::{homography_warp, HomographyWarper, Roi};
