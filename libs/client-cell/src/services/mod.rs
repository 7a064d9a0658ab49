pub mod clients;

pub use clients::ClientService;
