mod cmb;
mod config;
mod flux;
mod options;
mod profiles;
