mod ack_tracker;
pub mod mqtt_connection;

pub use mqtt_connection::MqttBrokerConnection;
