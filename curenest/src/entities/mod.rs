mod autoclave;
mod batch;
mod fixture;
mod level;
mod placement;
mod status;

#[doc(inline)]
pub use autoclave::Autoclave;

#[doc(inline)]
pub use batch::BatchMetrics;

#[doc(inline)]
pub use batch::NestingBatch;

#[doc(inline)]
pub use fixture::SupportFixture;

#[doc(inline)]
pub use level::Level;

#[doc(inline)]
pub use placement::ToolPlacement;

#[doc(inline)]
pub use status::BatchStatus;
