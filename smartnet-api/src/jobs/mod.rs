pub mod magic_link_expiry;
