pub mod awards;
pub mod clock;
pub mod derive;
pub mod id;
pub mod ops;
pub mod service;

pub use awards::AwardCounting;
pub use clock::SystemClock;
pub use id::TimestampIdGenerator;
pub use service::{Notice, NoticeLevel, Receipt, TaskService};
