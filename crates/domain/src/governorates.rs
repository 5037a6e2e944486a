//! Static reference table of Egypt's 27 governorates.
//!
//! Governorates are reference data, not user-editable rows: citizens and
//! candidates store a bare `governorate_id` and display names are derived
//! by lookup here. The table is compiled in rather than loaded from a file
//! at runtime.

use serde::Serialize;

/// A single governorate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Governorate {
    pub id: i32,
    pub name_ar: &'static str,
    pub name_en: &'static str,
    pub slug: &'static str,
    pub region: &'static str,
}

pub const GOVERNORATES: [Governorate; 27] = [
    Governorate { id: 1, name_ar: "القاهرة", name_en: "Cairo", slug: "cairo", region: "القاهرة الكبرى" },
    Governorate { id: 2, name_ar: "الجيزة", name_en: "Giza", slug: "giza", region: "القاهرة الكبرى" },
    Governorate { id: 3, name_ar: "القليوبية", name_en: "Qalyubia", slug: "qalyubia", region: "القاهرة الكبرى" },
    Governorate { id: 4, name_ar: "الإسكندرية", name_en: "Alexandria", slug: "alexandria", region: "الساحل الشمالي" },
    Governorate { id: 5, name_ar: "مطروح", name_en: "Matrouh", slug: "matrouh", region: "الساحل الشمالي" },
    Governorate { id: 6, name_ar: "الدقهلية", name_en: "Dakahlia", slug: "dakahlia", region: "الدلتا" },
    Governorate { id: 7, name_ar: "البحيرة", name_en: "Beheira", slug: "beheira", region: "الدلتا" },
    Governorate { id: 8, name_ar: "الغربية", name_en: "Gharbia", slug: "gharbia", region: "الدلتا" },
    Governorate { id: 9, name_ar: "المنوفية", name_en: "Menofia", slug: "menofia", region: "الدلتا" },
    Governorate { id: 10, name_ar: "كفر الشيخ", name_en: "Kafr El Sheikh", slug: "kafr-el-sheikh", region: "الدلتا" },
    Governorate { id: 11, name_ar: "دمياط", name_en: "Damietta", slug: "damietta", region: "الدلتا" },
    Governorate { id: 12, name_ar: "الشرقية", name_en: "Sharkia", slug: "sharkia", region: "الدلتا" },
    Governorate { id: 13, name_ar: "الإسماعيلية", name_en: "Ismailia", slug: "ismailia", region: "القناة" },
    Governorate { id: 14, name_ar: "السويس", name_en: "Suez", slug: "suez", region: "القناة" },
    Governorate { id: 15, name_ar: "بورسعيد", name_en: "Port Said", slug: "port-said", region: "القناة" },
    Governorate { id: 16, name_ar: "شمال سيناء", name_en: "North Sinai", slug: "north-sinai", region: "سيناء" },
    Governorate { id: 17, name_ar: "جنوب سيناء", name_en: "South Sinai", slug: "south-sinai", region: "سيناء" },
    Governorate { id: 18, name_ar: "الفيوم", name_en: "Fayoum", slug: "fayoum", region: "الصعيد" },
    Governorate { id: 19, name_ar: "بني سويف", name_en: "Beni Suef", slug: "beni-suef", region: "الصعيد" },
    Governorate { id: 20, name_ar: "المنيا", name_en: "Minya", slug: "minya", region: "الصعيد" },
    Governorate { id: 21, name_ar: "أسيوط", name_en: "Assiut", slug: "assiut", region: "الصعيد" },
    Governorate { id: 22, name_ar: "سوهاج", name_en: "Sohag", slug: "sohag", region: "الصعيد" },
    Governorate { id: 23, name_ar: "قنا", name_en: "Qena", slug: "qena", region: "الصعيد" },
    Governorate { id: 24, name_ar: "الأقصر", name_en: "Luxor", slug: "luxor", region: "الصعيد" },
    Governorate { id: 25, name_ar: "أسوان", name_en: "Aswan", slug: "aswan", region: "الصعيد" },
    Governorate { id: 26, name_ar: "البحر الأحمر", name_en: "Red Sea", slug: "red-sea", region: "المحافظات الحدودية" },
    Governorate { id: 27, name_ar: "الوادي الجديد", name_en: "New Valley", slug: "new-valley", region: "المحافظات الحدودية" },
];

/// All governorates in id order.
pub fn all() -> &'static [Governorate] {
    &GOVERNORATES
}

/// Looks up a governorate by its id.
pub fn by_id(id: i32) -> Option<&'static Governorate> {
    GOVERNORATES.iter().find(|g| g.id == id)
}

/// Looks up a governorate by its URL slug.
pub fn by_slug(slug: &str) -> Option<&'static Governorate> {
    GOVERNORATES.iter().find(|g| g.slug == slug)
}

/// Whether the id refers to a known governorate.
pub fn is_valid_id(id: i32) -> bool {
    by_id(id).is_some()
}

/// Display name for a governorate id, falling back to "غير محدد" for
/// unknown ids the way the public profile pages do.
pub fn name_ar(id: i32) -> &'static str {
    by_id(id).map_or("غير محدد", |g| g.name_ar)
}

/// Case-insensitive substring search over Arabic and English names.
pub fn search(query: &str) -> Vec<&'static Governorate> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return GOVERNORATES.iter().collect();
    }

    GOVERNORATES
        .iter()
        .filter(|g| {
            g.name_ar.contains(&query)
                || g.name_en.to_lowercase().contains(&query)
                || g.slug.contains(&query)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_exactly_27_governorates() {
        assert_eq!(all().len(), 27);
    }

    #[test]
    fn test_ids_and_slugs_unique() {
        let ids: HashSet<_> = all().iter().map(|g| g.id).collect();
        let slugs: HashSet<_> = all().iter().map(|g| g.slug).collect();
        let names: HashSet<_> = all().iter().map(|g| g.name_ar).collect();
        assert_eq!(ids.len(), 27);
        assert_eq!(slugs.len(), 27);
        assert_eq!(names.len(), 27);
    }

    #[test]
    fn test_by_id() {
        assert_eq!(by_id(1).unwrap().name_en, "Cairo");
        assert_eq!(by_id(24).unwrap().name_ar, "الأقصر");
        assert!(by_id(0).is_none());
        assert!(by_id(28).is_none());
    }

    #[test]
    fn test_by_slug() {
        assert_eq!(by_slug("giza").unwrap().id, 2);
        assert!(by_slug("atlantis").is_none());
    }

    #[test]
    fn test_name_ar_fallback() {
        assert_eq!(name_ar(1), "القاهرة");
        assert_eq!(name_ar(99), "غير محدد");
    }

    #[test]
    fn test_search_english_case_insensitive() {
        let hits = search("CAIRO");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn test_search_arabic_substring() {
        let hits = search("سيناء");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_search_empty_returns_all() {
        assert_eq!(search("  ").len(), 27);
    }
}
