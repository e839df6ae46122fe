pub mod command_menu;
