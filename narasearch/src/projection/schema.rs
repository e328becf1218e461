//! Per-category column configuration.
//!
//! The projector itself is category-agnostic; everything that differs between
//! bid notices and pre-specifications lives in the tables below.

use crate::core::Category;

/// Raw field holding the assigned budget.
pub const BUDGET_AMOUNT_FIELD: &str = "asignBdgtAmt";

/// Label of the detail link column guaranteed in every display table.
pub const DETAIL_LINK_LABEL: &str = "상세링크";

/// A raw field and its human label.
pub type FieldLabel = (&'static str, &'static str);

/// Numbered attachment URL fields (`{prefix}1` .. `{prefix}{count}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentSpec {
    /// Field name prefix.
    pub prefix: &'static str,
    /// Highest index.
    pub count: usize,
    /// Label used when offering the attachment.
    pub label: &'static str,
}

impl AttachmentSpec {
    /// Returns the field name for a 1-based index.
    #[must_use]
    pub fn field(&self, index: usize) -> String {
        format!("{}{index}", self.prefix)
    }

    /// Returns `(index, field)` pairs in index order.
    pub fn fields(&self) -> impl Iterator<Item = (usize, String)> + '_ {
        (1..=self.count).map(|i| (i, self.field(i)))
    }
}

/// Column configuration for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySchema {
    /// The category.
    pub category: Category,
    /// Display columns in order.
    pub display: &'static [FieldLabel],
    /// Raw field copied into the detail link column, if the API has one.
    pub detail_link_field: Option<&'static str>,
    /// Attachment URL fields kept hidden in the display table.
    pub attachments: AttachmentSpec,
    /// Export columns in order.
    pub export: &'static [FieldLabel],
}

static BID_NOTICE: CategorySchema = CategorySchema {
    category: Category::BidNotice,
    display: &[
        ("bidNtceNo", "입찰공고번호"),
        ("bidNtceDt", "입찰공고일시"),
        ("bidNtceNm", "입찰공고명"),
        ("ntceInsttNm", "공고기관명"),
        ("cntrctCnclsMthdNm", "계약체결방법명"),
        ("bidBeginDt", "입찰개시일시"),
        ("bidClseDt", "입찰마감일시"),
        ("asignBdgtAmt", "배정예산금액"),
    ],
    detail_link_field: Some("bidNtceDtlUrl"),
    attachments: AttachmentSpec {
        prefix: "ntceSpecDocUrl",
        count: 10,
        label: "첨부파일",
    },
    export: &[
        ("bidNtceNo", "입찰공고번호"),
        ("ntceKindNm", "공고종류명"),
        ("bidNtceDt", "입찰공고일시"),
        ("bidNtceNm", "입찰공고명"),
        ("ntceInsttNm", "공고기관명"),
        ("dminsttNm", "수요기관명"),
        ("bidMethdNm", "입찰방식명"),
        ("cntrctCnclsMthdNm", "계약체결방법명"),
        ("bidBeginDt", "입찰개시일시"),
        ("bidClseDt", "입찰마감일시"),
        ("bidPrtcptLmtYn", "입찰참가제한여부"),
        ("asignBdgtAmt", "배정예산금액"),
        ("sucsfbidLwltRate", "낙찰하한율"),
        ("sucsfbidMthdNm", "낙찰방법명"),
    ],
};

static PRE_SPEC: CategorySchema = CategorySchema {
    category: Category::PreSpec,
    display: &[
        ("bfSpecRgstNo", "사전규격등록번호"),
        ("rcptDt", "접수일시"),
        ("prdctClsfcNoNm", "품명(사업명)"),
        ("orderInsttNm", "발주기관명"),
        ("rlDminsttNm", "실수요기관명"),
        ("opninRgstClseDt", "의견등록마감일시"),
        ("asignBdgtAmt", "배정예산금액"),
    ],
    detail_link_field: None,
    attachments: AttachmentSpec {
        prefix: "specDocFileUrl",
        count: 5,
        label: "규격문서",
    },
    export: &[
        ("bfSpecRgstNo", "사전규격등록번호"),
        ("refNo", "참조번호"),
        ("rcptDt", "접수일시"),
        ("prdctClsfcNoNm", "품명(사업명)"),
        ("orderInsttNm", "발주기관명"),
        ("rlDminsttNm", "실수요기관명"),
        ("opninRgstClseDt", "의견등록마감일시"),
        ("asignBdgtAmt", "배정예산금액"),
        ("ofclNm", "담당자명"),
        ("ofclTelNo", "담당자전화번호"),
        ("dlvrTmlmtDt", "납품기한일시"),
    ],
};

/// Returns the column configuration for a category.
#[must_use]
pub fn schema_for(category: Category) -> &'static CategorySchema {
    match category {
        Category::BidNotice => &BID_NOTICE,
        Category::PreSpec => &PRE_SPEC,
    }
}
