const LAO_MONTHS: [&str; 12] = [
    "ມັງກອນ",
    "ກຸມພາ",
    "ມີນາ",
    "ເມສາ",
    "ພຶດສະພາ",
    "ມິຖຸນາ",
    "ກໍລະກົດ",
    "ສິງຫາ",
    "ກັນຍາ",
    "ຕຸລາ",
    "ພະຈິກ",
    "ທັນວາ",
];

/// Lao name of a month numbered 1-12. Empty for anything else.
pub fn lao_month_name(month: i32) -> &'static str {
    usize::try_from(month - 1)
        .ok()
        .and_then(|i| LAO_MONTHS.get(i))
        .copied()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_names() {
        assert_eq!(lao_month_name(1), "ມັງກອນ");
        assert_eq!(lao_month_name(6), "ມິຖຸນາ");
        assert_eq!(lao_month_name(12), "ທັນວາ");
    }

    #[test]
    fn test_out_of_range_month_is_empty() {
        assert_eq!(lao_month_name(0), "");
        assert_eq!(lao_month_name(13), "");
        assert_eq!(lao_month_name(-4), "");
    }
}
