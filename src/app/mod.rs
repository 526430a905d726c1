// Application layer: concrete pipelines wired from core pieces.

pub mod pipelines;
