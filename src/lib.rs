// Domain types shared by every layer
pub mod model;

// Configuration loading
pub mod config;

// Random telemetry generation and drift
pub mod telemetry;

// Dashboard state store and updater task
pub mod store;

// Filters, summaries and reports over store snapshots
pub mod views;

// Mock authentication and persisted user profile
pub mod session;

// HTTP and WebSocket APIs
pub mod api;

// Subscription management
pub mod subscription;
