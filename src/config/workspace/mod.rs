pub mod staging_paths;
