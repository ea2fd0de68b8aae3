pub mod directory_map;
