pub(crate) mod checksum;
