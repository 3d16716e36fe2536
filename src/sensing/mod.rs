pub mod controller;
pub mod detector;
pub mod frame;
pub mod loop_worker;

pub use controller::SamplingController;
pub use detector::{DetectionPipeline, FaceDetector, FrameSource, ObjectDetector};
pub use frame::WorkingFrame;
pub use loop_worker::LoopContext;
