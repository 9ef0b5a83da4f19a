pub mod current_mode;
pub mod login;
pub mod logout;
pub mod session;
pub mod set_ctf_mode;

#[cfg(test)]
pub(crate) mod test_support;
