pub mod form_view;
pub mod table_renderer;
