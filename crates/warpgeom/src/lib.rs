#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use warpgeom_tensor as tensor;

#[doc(inline)]
pub use warpgeom_imgproc as imgproc;
