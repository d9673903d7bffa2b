pub mod risk_event_ops;
