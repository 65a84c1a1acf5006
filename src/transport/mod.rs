//! Transport layer: wire-format details (query encoding and JSON decoding).

mod payload;
mod request;
mod response;

pub use request::{
    build_url, encode_balance_query, encode_create_task_query, encode_solution_query,
};
pub use response::decode_service_json_response;
