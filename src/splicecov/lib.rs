pub mod alignment;
pub mod annotation;
pub mod draw_splices;
pub mod layout;
pub mod render;
pub mod splice_table;
pub mod transcript;
