pub mod cv;
pub mod review;
