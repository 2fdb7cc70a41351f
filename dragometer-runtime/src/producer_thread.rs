use crate::error::ProducerError;
use crate::producer::Producer;
use dragometer_core::DashboardController;
use std::thread::{self, JoinHandle};

/// Starts `producer` on its own thread and hands its outcome to `on_exit`.
///
/// The thread is never joined by the GUI; closing the window abandons it.
pub fn spawn_producer<F>(
    producer: Producer,
    controller: DashboardController,
    on_exit: F,
) -> std::io::Result<JoinHandle<()>>
where
    F: FnOnce(Result<(), ProducerError>) + Send + 'static,
{
    thread::Builder::new()
        .name("producer".to_string())
        .spawn(move || {
            log::info!("producer {} started", producer.name());
            let result = producer.run(&controller);
            drop(controller);
            on_exit(result);
        })
}
