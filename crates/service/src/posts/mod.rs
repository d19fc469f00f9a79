pub mod service;

pub use service::PostsService;
