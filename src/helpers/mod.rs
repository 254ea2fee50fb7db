pub mod grid;
pub mod orientation;

use std::fs;

pub fn get_data_from_file_res(name: &str) -> std::io::Result<String> {
    let path = format!("data/{}.txt", name);
    fs::read_to_string(path)
}
