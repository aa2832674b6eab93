/// Declare a record type that binds to and from JSON objects.
///
/// The macro takes one struct definition and emits it together with four
/// implementations: `Default` (every field starts at its default),
/// [`Bind`](crate::Bind) (JSON objects populate fields by name, skipping
/// unknown properties and values that do not convert), and
/// [`Encode`](crate::Encode) (the record encodes as an object with one
/// property per field, in declaration order). Field types must themselves
/// implement [`Bind`](crate::Bind), so records nest.
///
/// ```
/// use jsonbind::record;
///
/// record! {
///     /// A named measurement series.
///     #[derive(Debug, PartialEq)]
///     pub struct Series {
///         pub label: String,
///         pub samples: Vec<f64>,
///         pub scale: Option<f64>,
///     }
/// }
///
/// let series: Series = jsonbind::bind_str(
///     r#"{"label":"latency","samples":[0.5,0.75],"extra":true}"#,
/// )?;
/// assert_eq!(series.label, "latency");
/// assert_eq!(series.samples, [0.5, 0.75]);
/// assert_eq!(series.scale, None);
///
/// assert_eq!(
///     jsonbind::to_string(&series)?,
///     r#"{"label":"latency","samples":[0.5,0.75],"scale":null}"#,
/// );
/// # Ok::<(), jsonbind::Error>(())
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_attr:meta])*
                $field_vis:vis $field:ident : $ftype:ty
            ),* $(,)?
        }
    ) => {
        $(#[$attr])*
        $vis struct $name {
            $(
                $(#[$field_attr])*
                $field_vis $field: $ftype,
            )*
        }

        impl ::std::default::Default for $name {
            fn default() -> $name {
                $name {
                    $($field: ::std::default::Default::default(),)*
                }
            }
        }

        impl $crate::Bind for $name {
            fn binding() -> $crate::Binding {
                $crate::Binding {
                    new_object: ::std::option::Option::Some(|| {
                        ::std::boxed::Box::new(<$name as ::std::default::Default>::default())
                    }),
                    new_array: ::std::option::Option::None,
                    child: |property| match property {
                        $(
                            ::std::option::Option::Some(stringify!($field)) => {
                                ::std::option::Option::Some(<$ftype as $crate::Bind>::binding())
                            }
                        )*
                        _ => ::std::option::Option::None,
                    },
                    assign: |target, property, node| {
                        if let ::std::option::Option::Some(record) =
                            target.downcast_mut::<$name>()
                        {
                            match property {
                                $(
                                    ::std::option::Option::Some(stringify!($field)) => {
                                        if let ::std::option::Option::Some(value) =
                                            <$ftype as $crate::Bind>::from_node(node)
                                        {
                                            record.$field = value;
                                        }
                                    }
                                )*
                                _ => {}
                            }
                        }
                    },
                }
            }

            fn from_node(node: $crate::Slot) -> ::std::option::Option<$name> {
                match node {
                    $crate::Slot::Built(built) => built.downcast(),
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl $crate::Encode for $name {
            fn encode<W>(&self, encoder: &mut $crate::Encoder<W>) -> $crate::Result<()>
            where
                W: ::std::io::Write,
            {
                #[allow(unused_mut)]
                let mut object = encoder.object()?;
                $(object.property(stringify!($field), &self.$field)?;)*
                object.finish()
            }
        }
    };
}
