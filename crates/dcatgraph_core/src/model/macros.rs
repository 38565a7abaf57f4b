//! Declaration macro for entity records.

/// Declares one entity record: the struct, its schema defaults, a `new(id)`
/// constructor, its `EntitySchema` constant and its `Entity` impl.
///
/// Each field is written as `rust_name: Type => "attributeName"`. The
/// attribute name is used both in the store and in JSON documents. The
/// identifying `id: String` field is added implicitly.
macro_rules! entity_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident in $kind:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident: $ty:ty => $attr:literal,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(default)]
        pub struct $name {
            /// Stable identifier; the vertex primary key.
            pub id: String,
            $(
                $(#[$field_meta])*
                #[serde(rename = $attr)]
                pub $field: $ty,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    id: String::new(),
                    $($field: <$ty as $crate::model::schema::FieldType>::default_value(),)*
                }
            }
        }

        impl $name {
            /// A record with the given identifier and every other field at
            /// its schema default.
            pub fn new(id: impl Into<String>) -> Self {
                Self {
                    id: id.into(),
                    ..Self::default()
                }
            }
        }

        impl $crate::model::schema::Entity for $name {
            const SCHEMA: $crate::model::schema::EntitySchema =
                $crate::model::schema::EntitySchema {
                    kind: $crate::model::schema::VertexKind::$kind,
                    id_field: "id",
                    fields: &[
                        $(
                            $crate::model::schema::FieldSpec {
                                name: $attr,
                                kind: <$ty as $crate::model::schema::FieldType>::KIND,
                            },
                        )*
                    ],
                };

            fn id(&self) -> &str {
                self.id.as_str()
            }

            fn to_fields(&self) -> Vec<(&'static str, $crate::model::schema::FieldValue)> {
                vec![
                    $(
                        (
                            $attr,
                            $crate::model::schema::FieldType::to_field_value(&self.$field),
                        ),
                    )*
                ]
            }

            fn from_fields(
                id: String,
                mut fields: $crate::model::schema::FieldValues,
            ) -> Result<Self, $crate::model::schema::FieldError> {
                Ok(Self {
                    id,
                    $($field: fields.take::<$ty>($attr)?,)*
                })
            }
        }
    };
}
