//! Catalog of the furniture-store master-data resources

use crate::schema::{FieldDefault, FieldKind, FieldSpec, OptionSource, ResourceSchema};
use crate::{Error, Result};

const fn text(name: &'static str, label: &'static str, required: bool) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind: FieldKind::Text,
        required,
        default: FieldDefault::Text(""),
        options_from: None,
    }
}

const fn flag(name: &'static str, label: &'static str, default: bool) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind: FieldKind::Boolean,
        required: false,
        default: FieldDefault::Bool(default),
        options_from: None,
    }
}

const fn integer(name: &'static str, label: &'static str, required: bool, default: i64) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind: FieldKind::Integer,
        required,
        default: FieldDefault::Integer(default),
        options_from: None,
    }
}

const ASSEMBLY_TYPE_FIELDS: &[FieldSpec] = &[text("name", "Name", true)];

const BRAND_FIELDS: &[FieldSpec] = &[
    text("name", "Name", true),
    text("logo_url", "Logo URL", false),
    flag("status", "Active", true),
];

/// Integer field picked from `source`'s records
const fn picked(
    name: &'static str,
    label: &'static str,
    default: i64,
    source: OptionSource,
) -> FieldSpec {
    FieldSpec {
        options_from: Some(source),
        ..integer(name, label, false, default)
    }
}

const CATEGORY_FIELDS: &[FieldSpec] = &[
    text("title", "Title", true),
    FieldSpec {
        name: "parent_id",
        label: "Parent",
        kind: FieldKind::Reference,
        required: false,
        default: FieldDefault::Null,
        options_from: Some(OptionSource {
            path: "categories",
            label: "title",
        }),
    },
    integer("position", "Position", false, 1),
    flag("status", "Active", true),
    text("frontDisplay", "Front Display", false),
    text("appIcon", "App Icon", false),
    text("webImage", "Web Image", false),
    text("mainImage", "Main Image", false),
    picked(
        "filterTypeId",
        "Filter Type",
        1,
        OptionSource {
            path: "filter-types",
            label: "name",
        },
    ),
    picked(
        "featureTypeId",
        "Feature Type",
        1,
        OptionSource {
            path: "feature-types",
            label: "name",
        },
    ),
];

const COLOR_FIELDS: &[FieldSpec] = &[
    text("name", "Name", true),
    text("hex_code", "Hex Code", false),
    flag("status", "Active", true),
];

const LOCATION_FIELDS: &[FieldSpec] = &[
    text("state", "State", true),
    text("city", "City", true),
    text("pincode", "Pincode", true),
    flag("is_serviceable", "Serviceable", true),
];

const MATERIAL_FIELDS: &[FieldSpec] = &[text("name", "Name", true), flag("status", "Active", true)];

const PRODUCT_STATUS_FIELDS: &[FieldSpec] = &[text("label", "Label", true)];

const ROOM_TYPE_FIELDS: &[FieldSpec] = &[text("name", "Name", true), flag("status", "Active", true)];

const SHIPPING_PARTNER_FIELDS: &[FieldSpec] = &[
    text("name", "Name", true),
    text("api_key", "API Key", false),
    text("contact_email", "Contact Email", false),
    flag("status", "Active", true),
];

const SIZE_UOM_FIELDS: &[FieldSpec] = &[text("title", "Title", true), flag("status", "Active", false)];

const STYLE_FIELDS: &[FieldSpec] = &[text("name", "Name", true), flag("status", "Active", true)];

const TAX_RULE_FIELDS: &[FieldSpec] = &[
    text("name", "Name", true),
    FieldSpec {
        name: "percentage",
        label: "Percentage",
        kind: FieldKind::Number,
        required: true,
        default: FieldDefault::Number(0.0),
        options_from: None,
    },
    FieldSpec {
        name: "applicable_on",
        label: "Applicable On",
        kind: FieldKind::Choice(&["MRP", "Discounted"]),
        required: true,
        default: FieldDefault::Text(""),
        options_from: None,
    },
];

const VENDOR_FIELDS: &[FieldSpec] = &[
    text("name", "Name", true),
    text("contact_email", "Contact Email", false),
    text("phone", "Phone", false),
    text("address", "Address", false),
    flag("status", "Active", true),
];

const WARRANTY_FIELDS: &[FieldSpec] = &[
    integer("duration_months", "Duration (months)", true, 0),
    text("description", "Description", false),
];

/// Every master-data resource, in navigation order
pub static CATALOG: &[ResourceSchema] = &[
    ResourceSchema {
        path: "categories",
        singular: "Category",
        plural: "Categories",
        fields: CATEGORY_FIELDS,
    },
    ResourceSchema {
        path: "assembly-types",
        singular: "Assembly Type",
        plural: "Assembly Types",
        fields: ASSEMBLY_TYPE_FIELDS,
    },
    ResourceSchema {
        path: "brands",
        singular: "Brand",
        plural: "Brands",
        fields: BRAND_FIELDS,
    },
    ResourceSchema {
        path: "colors",
        singular: "Color",
        plural: "Colors",
        fields: COLOR_FIELDS,
    },
    ResourceSchema {
        path: "locations",
        singular: "Location",
        plural: "Locations",
        fields: LOCATION_FIELDS,
    },
    ResourceSchema {
        path: "materials",
        singular: "Material",
        plural: "Materials",
        fields: MATERIAL_FIELDS,
    },
    ResourceSchema {
        path: "product-status",
        singular: "Product Status",
        plural: "Product Status",
        fields: PRODUCT_STATUS_FIELDS,
    },
    ResourceSchema {
        path: "room-types",
        singular: "Room Type",
        plural: "Room Types",
        fields: ROOM_TYPE_FIELDS,
    },
    ResourceSchema {
        path: "shipping-partners",
        singular: "Shipping Partner",
        plural: "Shipping Partners",
        fields: SHIPPING_PARTNER_FIELDS,
    },
    ResourceSchema {
        path: "size-uom",
        singular: "Size UOM",
        plural: "Size UOM",
        fields: SIZE_UOM_FIELDS,
    },
    ResourceSchema {
        path: "styles",
        singular: "Style",
        plural: "Styles",
        fields: STYLE_FIELDS,
    },
    ResourceSchema {
        path: "tax-rules",
        singular: "Tax Rule",
        plural: "Tax Rules",
        fields: TAX_RULE_FIELDS,
    },
    ResourceSchema {
        path: "vendors",
        singular: "Vendor",
        plural: "Vendors",
        fields: VENDOR_FIELDS,
    },
    ResourceSchema {
        path: "warranties",
        singular: "Warranty",
        plural: "Warranties",
        fields: WARRANTY_FIELDS,
    },
];

/// Find a resource by path (`tax-rules`) or label (`Tax Rules`, `tax rule`), ignoring case
///
/// # Errors
///
/// Returns [`Error::UnknownResource`] if nothing matches.
pub fn lookup(name: &str) -> Result<&'static ResourceSchema> {
    let wanted = name.trim();
    CATALOG
        .iter()
        .find(|schema| {
            schema.path.eq_ignore_ascii_case(wanted)
                || schema.plural.eq_ignore_ascii_case(wanted)
                || schema.singular.eq_ignore_ascii_case(wanted)
        })
        .ok_or_else(|| Error::UnknownResource {
            name: name.to_string(),
        })
}
