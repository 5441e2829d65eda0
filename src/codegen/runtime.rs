//! Growable list runtime linked into every compiled program
//!
//! The sources are embedded so the compiler needs nothing on disk besides the
//! C toolchain. [`crate::toolchain`] writes both files next to the generated
//! unit before invoking the compiler.
//!
//! A list starts with room for 10 floats, doubles when full and zero-fills the
//! new slots. `size` is the capacity, `last` the number of stored elements.
//! Records must start zeroed: `list_init` releases whatever storage the record
//! already holds, so a declaration that runs again inside a loop starts over
//! with a fresh list instead of leaking the old one.

/// Header file name, as included by generated code
pub const HEADER_NAME: &str = "wwe_list.h";

/// Implementation file name
pub const SOURCE_NAME: &str = "wwe_list.c";

pub const LIST_TYPE: &str = "WweList";
pub const LIST_INIT: &str = "list_init";
pub const LIST_PUSH: &str = "list_push";
pub const LIST_FIRST: &str = "list_first";
pub const LIST_LAST: &str = "list_last";
pub const LIST_SIZE: &str = "list_size";
pub const LIST_FREE: &str = "list_free";

pub const WWE_LIST_H: &str = r#"#ifndef WWE_LIST_H
#define WWE_LIST_H

#include <math.h>
#include <stdio.h>
#include <stdlib.h>

typedef struct {
    float *arr;
    int size;
    int last;
} WweList;

void list_init(WweList *list);
void list_push(WweList *list, float value);
float list_first(const WweList *list);
float list_last(const WweList *list);
float list_size(const WweList *list);
void list_free(WweList *list);

#endif
"#;

pub const WWE_LIST_C: &str = r#"#include "wwe_list.h"

#define WWE_LIST_INITIAL_CAPACITY 10

static void wwe_out_of_memory(void) {
    fprintf(stderr, "wwe: out of memory\n");
    exit(1);
}

void list_init(WweList *list) {
    free(list->arr);
    list->arr = calloc(WWE_LIST_INITIAL_CAPACITY, sizeof(float));
    if (list->arr == NULL) {
        wwe_out_of_memory();
    }
    list->size = WWE_LIST_INITIAL_CAPACITY;
    list->last = 0;
}

void list_push(WweList *list, float value) {
    if (list->last >= list->size) {
        int capacity = list->size * 2;
        float *grown = realloc(list->arr, (size_t)capacity * sizeof(float));
        if (grown == NULL) {
            wwe_out_of_memory();
        }
        for (int i = list->size; i < capacity; ++i) {
            grown[i] = 0;
        }
        list->arr = grown;
        list->size = capacity;
    }
    list->arr[list->last] = value;
    list->last += 1;
}

float list_first(const WweList *list) {
    return list->last > 0 ? list->arr[0] : 0;
}

float list_last(const WweList *list) {
    return list->last > 0 ? list->arr[list->last - 1] : 0;
}

float list_size(const WweList *list) {
    return (float)list->last;
}

void list_free(WweList *list) {
    free(list->arr);
    list->arr = NULL;
    list->size = 0;
    list->last = 0;
}
"#;
