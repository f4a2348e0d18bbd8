pub mod consumer;

pub use consumer::RabbitMQConsumer;
