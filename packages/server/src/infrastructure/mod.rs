//! Infrastructure layer: persistence, file storage, fan-out plumbing and DTOs.

pub mod broadcast;
pub mod dto;
pub mod repository;
pub mod storage;
