use tokio::runtime::{Builder, Runtime};

/// Double default stack size from 2MB to 4MB
pub const TOKIO_THREAD_STACK_SIZE: usize = 4 * 1024 * 1024;

lazy_static! {
    pub static ref TOKIO_RUNTIME: Runtime = runtime_builder()
        .enable_all()
        .build()
        .expect("Failed to build tokio runtime");
}

cfg_if::cfg_if! {
    if #[cfg(feature = "multi-thread")] {
        fn runtime_builder() -> Builder {
            let mut builder = Builder::new_multi_thread();
            builder.thread_stack_size(TOKIO_THREAD_STACK_SIZE);
            builder
        }
    } else {
        fn runtime_builder() -> Builder {
            Builder::new_current_thread()
        }
    }
}
