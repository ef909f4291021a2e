pub mod assets;
pub mod compress;
pub mod html;
pub mod postprocess;
