pub mod file_line;
pub mod file_list;
pub mod yaml_editor;
