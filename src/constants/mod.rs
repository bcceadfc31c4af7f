pub mod approved;
pub mod modes;
pub mod privileges;
