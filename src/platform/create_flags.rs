use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct CreateFlags: u32 {
        const CREATE_INDEXES      = 0x1;
        const CREATE_FOREIGN_KEYS = 0x2;
    }
}
