pub mod snow_editor;
