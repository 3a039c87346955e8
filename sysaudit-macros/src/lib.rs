use std::collections::HashMap;

use convert_case::{Case, Casing};
use itertools::Itertools;
use proc_macro::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote, ToTokens};
use syn::{
  bracketed, parenthesized,
  parse::{Parse, ParseStream},
  parse_macro_input,
  punctuated::Punctuated,
  spanned::Spanned,
  token, Attribute, Ident, LitInt, Token, Type, Visibility,
};

/// `pub static NAME; pub enum Name;`
struct TableHeader {
  static_vis: Visibility,
  static_name: Ident,
  enum_vis: Visibility,
  enum_name: Ident,
}

impl Parse for TableHeader {
  fn parse(input: ParseStream) -> syn::Result<Self> {
    let static_vis = input.parse()?;
    input.parse::<Token![static]>()?;
    let static_name = input.parse()?;
    input.parse::<Token![;]>()?;
    let enum_vis = input.parse()?;
    input.parse::<Token![enum]>()?;
    let enum_name = input.parse()?;
    input.parse::<Token![;]>()?;
    Ok(Self {
      static_vis,
      static_name,
      enum_vis,
      enum_name,
    })
  }
}

struct SyscallTable {
  header: TableHeader,
  entries: Punctuated<SyscallEntry, Token![,]>,
}

impl Parse for SyscallTable {
  fn parse(input: ParseStream) -> syn::Result<Self> {
    Ok(Self {
      header: input.parse()?,
      entries: Punctuated::parse_terminated(input)?,
    })
  }
}

/// `#[attrs] name = number -> ret (arg: rule | rule, ...)`
struct SyscallEntry {
  attrs: Vec<Attribute>,
  name: Ident,
  number: LitInt,
  ret: Ident,
  args: Punctuated<ArgEntry, Token![,]>,
}

impl Parse for SyscallEntry {
  fn parse(input: ParseStream) -> syn::Result<Self> {
    let attrs = input.call(Attribute::parse_outer)?;
    let name = input.parse()?;
    input.parse::<Token![=]>()?;
    let number = input.parse()?;
    input.parse::<Token![->]>()?;
    let ret = input.parse()?;
    let content;
    parenthesized!(content in input);
    Ok(Self {
      attrs,
      name,
      number,
      ret,
      args: content.parse_terminated(ArgEntry::parse, Token![,])?,
    })
  }
}

struct ArgEntry {
  attrs: Vec<Attribute>,
  name: Ident,
  rules: Punctuated<RuleExpr, Token![|]>,
}

impl Parse for ArgEntry {
  fn parse(input: ParseStream) -> syn::Result<Self> {
    let attrs = input.call(Attribute::parse_outer)?;
    let name = input.parse()?;
    input.parse::<Token![:]>()?;
    Ok(Self {
      attrs,
      name,
      rules: Punctuated::parse_separated_nonempty(input)?,
    })
  }
}

#[derive(Clone, Copy, PartialEq)]
enum Direction {
  Inline,
  In,
  Out,
  InOut,
}

enum ArrayLen {
  Arg(Ident),
  Pointee(Ident),
  Ret,
  Literal(LitInt),
}

enum RuleTarget {
  Typed(Type),
  Array { elem: Type, len: ArrayLen },
}

struct RuleExpr {
  direction: Direction,
  target: RuleTarget,
}

fn peek_keyword(input: ParseStream, keyword: &str) -> bool {
  input
    .fork()
    .parse::<Ident>()
    .map_or(false, |ident| ident == keyword)
}

impl Parse for RuleExpr {
  fn parse(input: ParseStream) -> syn::Result<Self> {
    let direction = if input.peek(Token![in]) {
      input.parse::<Token![in]>()?;
      Direction::In
    } else if peek_keyword(input, "out") {
      input.parse::<Ident>()?;
      Direction::Out
    } else if peek_keyword(input, "inout") {
      input.parse::<Ident>()?;
      Direction::InOut
    } else {
      Direction::Inline
    };
    let target = if input.peek(token::Bracket) {
      let content;
      let bracket = bracketed!(content in input);
      if direction == Direction::Inline {
        return Err(syn::Error::new(
          bracket.span.join(),
          "buffers need a direction: `in`, `out` or `inout`",
        ));
      }
      let elem = content.parse()?;
      content.parse::<Token![;]>()?;
      let len = if content.peek(Token![*]) {
        content.parse::<Token![*]>()?;
        ArrayLen::Pointee(content.parse()?)
      } else if content.peek(LitInt) {
        ArrayLen::Literal(content.parse()?)
      } else {
        let ident: Ident = content.parse()?;
        if ident == "ret" {
          ArrayLen::Ret
        } else {
          ArrayLen::Arg(ident)
        }
      };
      RuleTarget::Array { elem, len }
    } else {
      RuleTarget::Typed(input.parse()?)
    };
    Ok(Self { direction, target })
  }
}

struct EntryAttrs {
  docs: Vec<Attribute>,
  since: Option<Ident>,
  until: Option<Ident>,
  status: proc_macro2::TokenStream,
  success: proc_macro2::TokenStream,
  wide_ret: bool,
}

fn parse_version(attr: &Attribute) -> syn::Result<Ident> {
  let release: Ident = attr.parse_args()?;
  Ok(Ident::new(
    &release.to_string().to_case(Case::UpperCamel),
    release.span(),
  ))
}

fn parse_entry_attrs(
  attrs: &[Attribute],
  crate_token: &proc_macro2::TokenStream,
) -> syn::Result<EntryAttrs> {
  let mut parsed = EntryAttrs {
    docs: vec![],
    since: None,
    until: None,
    status: quote!(#crate_token::SupportStatus::Supported),
    success: quote!(#crate_token::SuccessCode::Platform),
    wide_ret: false,
  };
  for attr in attrs {
    let path = attr.path();
    if path.is_ident("doc") {
      parsed.docs.push(attr.clone());
    } else if path.is_ident("since") {
      parsed.since = Some(parse_version(attr)?);
    } else if path.is_ident("until") {
      parsed.until = Some(parse_version(attr)?);
    } else if path.is_ident("unknown") {
      parsed.status = quote!(#crate_token::SupportStatus::UnknownBehavior);
    } else if path.is_ident("unimplemented") {
      parsed.status = quote!(#crate_token::SupportStatus::Unimplemented);
    } else if path.is_ident("zero_fails") {
      parsed.success = quote!(#crate_token::SuccessCode::ZeroFails);
    } else if path.is_ident("never_fails") {
      parsed.success = quote!(#crate_token::SuccessCode::NeverFails);
    } else if path.is_ident("ret64") {
      parsed.wide_ret = true;
    } else {
      return Err(syn::Error::new(
        attr.span(),
        format!("unknown syscall attribute `{}`", path.to_token_stream()),
      ));
    }
  }
  Ok(parsed)
}

struct ArgAttrs {
  ilp32_only: bool,
  on_failure: bool,
}

fn parse_arg_attrs(attrs: &[Attribute]) -> syn::Result<ArgAttrs> {
  let mut parsed = ArgAttrs {
    ilp32_only: false,
    on_failure: false,
  };
  for attr in attrs {
    if attr.path().is_ident("ilp32") {
      parsed.ilp32_only = true;
    } else if attr.path().is_ident("on_failure") {
      parsed.on_failure = true;
    } else {
      return Err(syn::Error::new(attr.span(), "expected `#[ilp32]` or `#[on_failure]`"));
    }
  }
  Ok(parsed)
}

fn is_byte(ty: &Type) -> bool {
  ty.to_token_stream().to_string() == "u8"
}

fn gen_flags(flags: &[&str], crate_token: &proc_macro2::TokenStream) -> proc_macro2::TokenStream {
  if flags.is_empty() {
    return quote!(::enumflags2::BitFlags::EMPTY);
  }
  let flags = flags.iter().map(|flag| format_ident!("{}", flag));
  quote! {
    {
      use #crate_token::ArgFlags;
      ::enumflags2::make_bitflags!(ArgFlags::{#(#flags)|*})
    }
  }
}

fn gen_rule(
  ordinal: u8,
  rule: &RuleExpr,
  attrs: &ArgAttrs,
  ordinals: &HashMap<String, u8>,
  crate_token: &proc_macro2::TokenStream,
) -> syn::Result<proc_macro2::TokenStream> {
  let resolve = |ident: &Ident| {
    ordinals.get(&ident.to_string()).copied().ok_or_else(|| {
      syn::Error::new(ident.span(), format!("no argument named `{}`", ident))
    })
  };
  let mut flags = match rule.direction {
    Direction::Inline => vec![],
    Direction::In => vec!["Read"],
    Direction::Out => vec!["Write"],
    Direction::InOut => vec!["Read", "Write"],
  };
  if attrs.on_failure {
    flags.push("WrittenOnFailure");
  }
  let mut generated = match &rule.target {
    RuleTarget::Typed(ty) if rule.direction == Direction::Inline => {
      quote! {
        #crate_token::ArgRule::inline(
          #ordinal,
          <#ty as #crate_token::CType>::SIZE,
          <#ty as #crate_token::CType>::KIND,
        )
      }
    }
    RuleTarget::Typed(ty) => {
      flags.push("HasType");
      let flags = gen_flags(&flags, crate_token);
      quote! {
        #crate_token::ArgRule::new(
          #ordinal,
          #crate_token::SizeSpec::Fixed(<#ty as #crate_token::CType>::SIZE),
          #flags,
          <#ty as #crate_token::CType>::KIND,
        )
      }
    }
    RuleTarget::Array { elem, len } => {
      let size = match len {
        ArrayLen::Arg(ident) => {
          let target = resolve(ident)?;
          quote!(#crate_token::SizeSpec::ArgValue(#target))
        }
        ArrayLen::Pointee(ident) => {
          let target = resolve(ident)?;
          quote!(#crate_token::SizeSpec::ArgPointee(#target))
        }
        ArrayLen::Ret => quote!(#crate_token::SizeSpec::ReturnValue),
        ArrayLen::Literal(lit) => {
          quote!(#crate_token::SizeSpec::Fixed(#crate_token::AbiSize::same(#lit)))
        }
      };
      if is_byte(elem) {
        let flags = gen_flags(&flags, crate_token);
        quote! {
          #crate_token::ArgRule::new(#ordinal, #size, #flags, #crate_token::ArgType::Pointer)
        }
      } else {
        flags.extend(["HasType", "SizeInElements"]);
        let flags = gen_flags(&flags, crate_token);
        quote! {
          #crate_token::ArgRule::new(
            #ordinal,
            #size,
            #flags,
            <#elem as #crate_token::CType>::KIND,
          )
          .elements(<#elem as #crate_token::CType>::SIZE)
        }
      }
    }
  };
  if attrs.ilp32_only {
    generated.extend(quote!(.ilp32_only()));
  }
  Ok(generated)
}

struct GenEntryResult {
  descriptor: proc_macro2::TokenStream,
  number_const: proc_macro2::TokenStream,
  const_name: Ident,
  variant: Ident,
  docs: Vec<Attribute>,
}

fn gen_entry(
  entry: &SyscallEntry,
  crate_token: &proc_macro2::TokenStream,
) -> syn::Result<GenEntryResult> {
  let name = &entry.name;
  let name_str = name.to_string();
  let number = &entry.number;
  let attrs = parse_entry_attrs(&entry.attrs, crate_token)?;
  if entry.args.len() > u8::MAX as usize {
    return Err(syn::Error::new(name.span(), "too many arguments"));
  }
  let ordinals: HashMap<String, u8> = entry
    .args
    .iter()
    .enumerate()
    .map(|(i, arg)| (arg.name.to_string(), i as u8))
    .collect();
  if let Some(dup) = entry.args.iter().map(|arg| arg.name.to_string()).duplicates().next() {
    return Err(syn::Error::new(name.span(), format!("argument `{}` declared twice", dup)));
  }
  let mut rules = vec![];
  for (i, arg) in entry.args.iter().enumerate() {
    let arg_attrs = parse_arg_attrs(&arg.attrs)?;
    for rule in arg.rules.iter() {
      rules.push(gen_rule(i as u8, rule, &arg_attrs, &ordinals, crate_token)?);
    }
  }
  let ret = &entry.ret;
  let ret_ctor = if attrs.wide_ret {
    format_ident!("wide")
  } else {
    format_ident!("new")
  };
  let version = |release: &Option<Ident>| match release {
    Some(release) => quote!(Some(#crate_token::MacOsVersion::#release)),
    None => quote!(None),
  };
  let since = version(&attrs.since);
  let removed_in = version(&attrs.until);
  let status = &attrs.status;
  let success = &attrs.success;
  let const_name = format_ident!("SYS_{}", name);
  let variant = Ident::new(&name_str.to_case(Case::UpperCamel), name.span());
  Ok(GenEntryResult {
    number_const: quote! {
      pub const #const_name: u32 = #number;
    },
    descriptor: quote! {
      #crate_token::SyscallDescriptor {
        key: #crate_token::SyscallKey::Bsd(#const_name),
        name: #name_str,
        status: #status,
        success: #success,
        ret: #crate_token::ReturnType::#ret_ctor(<#ret as #crate_token::CType>::KIND),
        availability: #crate_token::Availability {
          since: #since,
          removed_in: #removed_in,
        },
        args: &[#(#rules),*],
      }
    },
    const_name,
    variant,
    docs: attrs.docs,
  })
}

/// Generate a static descriptor table, `SYS_*` number constants and an enum with one
/// variant per entry.
///
/// Entries take `#[since(release)]`, `#[until(release)]`, `#[unknown]`,
/// `#[unimplemented]`, `#[ret64]`, and `#[zero_fails]` or `#[never_fails]` in place
/// of the platform's error flag. Arguments take `#[ilp32]` and `#[on_failure]`.
#[proc_macro]
pub fn gen_syscall_table(input: TokenStream) -> TokenStream {
  let table = parse_macro_input!(input as SyscallTable);
  match expand_table(table) {
    Ok(tokens) => tokens.into(),
    Err(e) => e.to_compile_error().into(),
  }
}

fn expand_table(table: SyscallTable) -> syn::Result<proc_macro2::TokenStream> {
  let crate_token = get_crate("sysaudit");
  let TableHeader {
    static_vis,
    static_name,
    enum_vis,
    enum_name,
  } = table.header;
  let mut descriptors = vec![];
  let mut number_consts = vec![];
  let mut const_names = vec![];
  let mut variants = vec![];
  let mut docs = vec![];
  let mut names = vec![];
  for entry in &table.entries {
    let GenEntryResult {
      descriptor,
      number_const,
      const_name,
      variant,
      docs: entry_docs,
    } = gen_entry(entry, &crate_token)?;
    descriptors.push(descriptor);
    number_consts.push(number_const);
    const_names.push(const_name);
    variants.push(variant);
    docs.push(entry_docs);
    names.push(entry.name.to_string());
  }
  if let Some(dup) = variants.iter().map(|v| v.to_string()).duplicates().next() {
    return Err(syn::Error::new(
      enum_name.span(),
      format!("two entries map to variant `{}`", dup),
    ));
  }
  let count = descriptors.len();
  Ok(quote! {
    #(#number_consts)*

    #static_vis static #static_name: [#crate_token::SyscallDescriptor; #count] = [
      #(#descriptors),*
    ];

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[repr(u16)]
    #enum_vis enum #enum_name {
      #(
        #(#docs)*
        #variants,
      )*
    }

    impl #enum_name {
      pub const ALL: [#enum_name; #count] = [#(#enum_name::#variants),*];

      pub const fn number(self) -> u32 {
        match self {
          #(#enum_name::#variants => #const_names,)*
        }
      }

      pub const fn name(self) -> &'static str {
        match self {
          #(#enum_name::#variants => #names,)*
        }
      }

      pub fn descriptor(self) -> &'static #crate_token::SyscallDescriptor {
        &#static_name[self as usize]
      }
    }
  })
}

fn get_crate(name: &str) -> proc_macro2::TokenStream {
  match crate_name(name) {
    Ok(FoundCrate::Itself) | Err(_) => quote!(crate),
    Ok(FoundCrate::Name(name)) => {
      let ident = format_ident!("{}", &name);
      quote!( #ident )
    }
  }
}
