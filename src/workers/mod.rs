mod date_worker;

pub use date_worker::DateWorker;
