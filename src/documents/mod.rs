mod game_record;
mod user_data;
mod wishlist_entry;

pub use game_record::GameRecord;
pub use user_data::UserData;
pub use wishlist_entry::WishlistEntry;
