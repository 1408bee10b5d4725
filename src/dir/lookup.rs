//! 目录项名称查找

use super::iterator::DirEntry;

/// 在目录项列表中按名称查找
///
/// 名称逐字节比较，返回第一个匹配项；
/// 没有匹配时返回 [`DirEntry::not_found`]（inode 为 0）。
pub fn find_entry_by_name(entries: &[DirEntry], name: &str) -> DirEntry {
    entries
        .iter()
        .find(|entry| entry.matches(name))
        .cloned()
        .unwrap_or_else(DirEntry::not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn entry(inode: u32, name: &[u8]) -> DirEntry {
        DirEntry {
            inode,
            rec_len: 12,
            name_len: name.len() as u8,
            file_type: 1,
            name: name.to_vec(),
        }
    }

    #[test]
    fn test_find_first_match() {
        let entries = vec![entry(3, b"a"), entry(4, b"b"), entry(5, b"b")];
        assert_eq!(find_entry_by_name(&entries, "b").inode, 4);
    }

    #[test]
    fn test_exact_match_only() {
        let entries = vec![entry(3, b"Readme"), entry(4, b"readme.txt")];
        assert!(!find_entry_by_name(&entries, "readme").is_found());
        assert!(!find_entry_by_name(&entries, "README").is_found());
        assert_eq!(find_entry_by_name(&entries, "readme.txt").inode, 4);
    }

    #[test]
    fn test_not_found() {
        let found = find_entry_by_name(&[], "x");
        assert_eq!(found, DirEntry::not_found());
    }
}
