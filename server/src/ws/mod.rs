//! WebSocket-Handler fuer Chat- und Signaling-Grenze

pub mod chat;
pub mod rtc;
