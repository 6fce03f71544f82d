pub fn cerr<Int: Copy + TryInto<libc::c_long>>(res: Int) -> std::io::Result<Int> {
    match res.try_into() {
        Ok(-1) => Err(std::io::Error::last_os_error()),
        _ => Ok(res),
    }
}

extern "C" {
    #[cfg_attr(
        any(target_os = "macos", target_os = "ios", target_os = "freebsd"),
        link_name = "__error"
    )]
    #[cfg_attr(
        any(target_os = "openbsd", target_os = "netbsd", target_os = "android"),
        link_name = "__errno"
    )]
    #[cfg_attr(target_os = "linux", link_name = "__errno_location")]
    fn errno_location() -> *mut libc::c_int;
}

/// Read the calling thread's `errno`. Async-signal-safe.
pub fn errno() -> libc::c_int {
    unsafe { *errno_location() }
}

/// Overwrite the calling thread's `errno`. Async-signal-safe.
pub fn set_errno(no: libc::c_int) {
    unsafe { *errno_location() = no };
}
