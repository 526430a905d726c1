pub mod zone_map_pipeline;
