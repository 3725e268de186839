//! The concrete command messages.

mod change_work_type;
mod rename;
mod unload_goods;

pub use change_work_type::ChangeWorkTypeMessage;
pub use rename::RenameMessage;
pub use unload_goods::UnloadGoodsMessage;
