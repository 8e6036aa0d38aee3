pub mod enrollment;
pub mod normalization;
pub mod notification;
