use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

#[derive(Serialize, Debug)]
pub struct Greeting {
    pub msg: String,
}
